//! Constants used in the registry scripts

/// Environment key holding the deployer credential (private key or seed phrase)
pub const CREDENTIAL_ENV_KEY: &str = "PRIVATE_KEY";

/// Name of the role registry stage
pub const ROLE_REGISTRY: &str = "RoleRegistry";
/// Name of the user registry stage
pub const USER_REGISTRY: &str = "UserRegistry";
/// Name of the document registry stage
pub const DOCUMENT_REGISTRY: &str = "DocumentRegistry";

/// Compiled artifact name of the role registry contract
pub const ROLE_ARTIFACT: &str = "Role";
/// Compiled artifact name of the user registry contract
pub const USER_ARTIFACT: &str = "User";
/// Compiled artifact name of the document registry contract
pub const DOCUMENT_ARTIFACT: &str = "DocumentState";

/// Directory where deployment records are written
pub const DEFAULT_DEPLOYMENTS_DIR: &str = "deployments";
