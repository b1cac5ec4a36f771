use std::{collections::HashMap, fmt};

use enum_as_inner::EnumAsInner;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::{
    config,
    err::{ensure, Context, Result},
};

/// Key under which the tenant id is exported in the credential field bag
pub const TENANT_ID_KEY: &str = "tenantId";
/// Key under which the client id is exported in the credential field bag
pub const SERVICE_PRINCIPAL_CLIENT_ID_KEY: &str = "servicePrincipalClientId";
/// Key under which the client secret is exported in the credential field bag
pub const SERVICE_PRINCIPAL_SECRET_KEY: &str = "servicePrincipalSecret";

/// The kind of a set of datasource credentials
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub enum CredentialType {
    Anonymous,
    ServicePrincipal,
}

impl fmt::Display for CredentialType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Anonymous => write!(f, "anonymous"),
            Self::ServicePrincipal => write!(f, "servicePrincipal"),
        }
    }
}

/// Credentials used to authenticate against an external datasource.
///
/// The transport layer which sends these to the target platform reads
/// the discriminator via `credential_type` to select its serialization
/// path and the raw fields via `credential_data`. Encrypting and
/// transmitting the fields is entirely its concern, not ours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, EnumAsInner)]
#[serde(tag = "credentialType")]
pub enum DatasourceCredentials {
    #[serde(rename = "anonymous")]
    Anonymous(AnonymousCredentials),
    #[serde(rename = "servicePrincipal")]
    ServicePrincipal(ServicePrincipalCredentials),
}

impl DatasourceCredentials {
    /// Creates credentials for anonymous datasource access
    pub fn anonymous() -> Self {
        Self::Anonymous(AnonymousCredentials::default())
    }

    /// Creates service-principal based credentials.
    ///
    /// The supplied values are stored verbatim, empty strings included.
    /// Use `validate` or `CredentialOpts` to opt in to presence checks.
    pub fn service_principal(
        tenant_id: impl Into<String>,
        client_id: impl Into<String>,
        secret: impl Into<String>,
    ) -> Self {
        Self::ServicePrincipal(ServicePrincipalCredentials::new(
            ServicePrincipalFields::new(tenant_id, client_id, secret),
        ))
    }

    pub fn parse(options: config::Value) -> Result<Self> {
        Self::parse_with(options, &CredentialOpts::default())
    }

    pub fn parse_with(options: config::Value, opts: &CredentialOpts) -> Result<Self> {
        let creds = config::from_value::<Self>(options)
            .context("Failed to parse datasource credential options")?;

        if opts.validate {
            creds.validate()?;
        } else if let Err(err) = creds.validate() {
            warn!("Datasource credentials have missing fields: {}", err);
        }

        Ok(creds)
    }

    /// The discriminator identifying which kind of credentials this is
    pub fn credential_type(&self) -> CredentialType {
        match self {
            Self::Anonymous(_) => CredentialType::Anonymous,
            Self::ServicePrincipal(_) => CredentialType::ServicePrincipal,
        }
    }

    /// Exports the credential fields as the key/value bag consumed
    /// by the transport layer.
    ///
    /// Contains exactly the keys relevant to this kind of credentials.
    pub fn credential_data(&self) -> HashMap<String, String> {
        match self {
            Self::Anonymous(_) => HashMap::new(),
            Self::ServicePrincipal(sp) => sp.fields.to_credential_data(),
        }
    }

    /// Checks that all required fields are non-empty.
    ///
    /// This is opt-in: constructors and the default parse path accept
    /// empty fields as-is.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Anonymous(_) => Ok(()),
            Self::ServicePrincipal(sp) => sp.fields.validate(),
        }
    }
}

/// Anonymous datasource credentials
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AnonymousCredentials {
    // Anonymous access carries no fields
}

/// Service-principal based datasource credentials
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServicePrincipalCredentials {
    /// The tenant/client/secret triple
    #[serde(flatten)]
    pub fields: ServicePrincipalFields,
}

impl ServicePrincipalCredentials {
    pub fn new(fields: ServicePrincipalFields) -> Self {
        Self { fields }
    }
}

/// The field group shared by credentials which authenticate via an
/// Azure-AD style service principal.
///
/// Kept as its own type so future variants (eg certificate-based
/// service principals) can embed the same triple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServicePrincipalFields {
    /// The tenant id
    #[serde(rename = "tenantId")]
    pub tenant_id: String,
    /// The client id of the service principal
    #[serde(rename = "servicePrincipalClientId")]
    pub service_principal_client_id: String,
    /// The client secret of the service principal
    #[serde(rename = "servicePrincipalSecret")]
    pub service_principal_secret: String,
}

impl ServicePrincipalFields {
    pub fn new(
        tenant_id: impl Into<String>,
        client_id: impl Into<String>,
        secret: impl Into<String>,
    ) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            service_principal_client_id: client_id.into(),
            service_principal_secret: secret.into(),
        }
    }

    /// Exports the triple under its fixed field bag keys
    pub fn to_credential_data(&self) -> HashMap<String, String> {
        HashMap::from([
            (TENANT_ID_KEY.into(), self.tenant_id.clone()),
            (
                SERVICE_PRINCIPAL_CLIENT_ID_KEY.into(),
                self.service_principal_client_id.clone(),
            ),
            (
                SERVICE_PRINCIPAL_SECRET_KEY.into(),
                self.service_principal_secret.clone(),
            ),
        ])
    }

    /// Checks all three fields are non-empty
    pub fn validate(&self) -> Result<()> {
        ensure!(
            !self.tenant_id.is_empty(),
            "{} cannot be empty",
            TENANT_ID_KEY
        );
        ensure!(
            !self.service_principal_client_id.is_empty(),
            "{} cannot be empty",
            SERVICE_PRINCIPAL_CLIENT_ID_KEY
        );
        ensure!(
            !self.service_principal_secret.is_empty(),
            "{} cannot be empty",
            SERVICE_PRINCIPAL_SECRET_KEY
        );

        Ok(())
    }
}

/// Options controlling how datasource credential config is parsed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CredentialOpts {
    /// Whether to reject credentials with empty required fields.
    /// Disabled by default.
    #[serde(default)]
    pub validate: bool,
}
