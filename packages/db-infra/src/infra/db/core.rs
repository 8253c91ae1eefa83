use std::future::Future;
use std::path::PathBuf;

use tracing::{error, info};

use crate::config::RootConfig;
use crate::domain::Project;
use crate::error::ProvisionError;
use crate::infra::db::admin::AdminChannel;
use crate::infra::db::mongo::MongoAdmin;
use crate::infra::db::uri::SCHEME;
use crate::provision::{ProvisionReport, Provisioner};

/// Everything one run needs, as given on the command line.
#[derive(Debug, Clone)]
pub struct ProvisionRequest {
    pub project_name: String,
    pub force: bool,
    pub config_path: PathBuf,
    pub output_dir: PathBuf,
}

/// Provision against the MongoDB server named in the root configuration.
pub async fn orchestrate_provisioning(
    request: &ProvisionRequest,
) -> Result<ProvisionReport, ProvisionError> {
    orchestrate_provisioning_with(request, |config| async move {
        MongoAdmin::connect(&config)
    })
    .await
}

/// Run the precondition checks in order, then provision.
///
/// 1. project name, else `Usage`
/// 2. root configuration, else `Config`
/// 3. authenticated ping, else `Connectivity`
///
/// `connect` is only called once the first two checks pass.
pub async fn orchestrate_provisioning_with<A, F, Fut>(
    request: &ProvisionRequest,
    connect: F,
) -> Result<ProvisionReport, ProvisionError>
where
    A: AdminChannel,
    F: FnOnce(RootConfig) -> Fut,
    Fut: Future<Output = Result<A, ProvisionError>>,
{
    let project = Project::new(&request.project_name)?;
    let config = RootConfig::from_file(&request.config_path)?;

    info!(
        "connect=start target={}://{}:{} user={}",
        SCHEME, config.host, config.port, config.username
    );

    let admin = connect(config.clone()).await?;
    if let Err(e) = admin.ping().await {
        error!(host = %config.host, port = config.port, err = %e, "liveness probe failed");
        return Err(ProvisionError::connectivity(format!(
            "cannot reach {}:{} as '{}': {e}",
            config.host, config.port, config.username
        )));
    }
    info!("connect=ok");

    let provisioner = Provisioner::new(admin, config, request.output_dir.clone());
    provisioner.provision(&project, request.force).await
}
