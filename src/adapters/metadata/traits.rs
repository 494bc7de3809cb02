//! Metadata service trait definition

use crate::domain::ids::{AppId, StudyId};
use crate::domain::{AppConfig, Result, StudyConfig, VersionedRecord};
use async_trait::async_trait;

/// Read access to application, study and participant metadata
///
/// Every call is a single remote request. Implementations must not cache:
/// export configuration can change between requests.
///
/// # Example
///
/// ```no_run
/// use pvexport::adapters::metadata::{MetadataService, RestMetadataClient};
/// use pvexport::config::ServiceConfig;
/// use pvexport::domain::AppId;
///
/// # async fn example() -> pvexport::domain::Result<()> {
/// let client = RestMetadataClient::new(&ServiceConfig::new("https://metadata.example.org"))?;
/// let app = client.get_app(&AppId::new("api").unwrap()).await?;
/// println!("export enabled: {}", app.export.is_enabled());
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait MetadataService: Send + Sync {
    /// Fetches an application's export configuration
    async fn get_app(&self, app_id: &AppId) -> Result<AppConfig>;

    /// Fetches a study's export configuration
    async fn get_study(&self, app_id: &AppId, study_id: &StudyId) -> Result<StudyConfig>;

    /// Fetches a participant record at a specific version
    ///
    /// `key` is the participant lookup key, e.g. `healthCode:<code>`.
    async fn get_versioned_record(
        &self,
        app_id: &AppId,
        key: &str,
        record_version: u32,
    ) -> Result<VersionedRecord>;
}
