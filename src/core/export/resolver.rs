//! Destination resolution
//!
//! Decides which tables a participant version is written to. Resolution is a
//! pure function of the app config, the fetched study configs and the
//! record's memberships.

use crate::domain::{AppConfig, Destination, StudyConfig, StudyId};
use std::collections::HashMap;

/// Resolves the ordered destinations for one participant version
///
/// Returns nothing at all when the app itself is not export-enabled, whatever
/// the studies say. Otherwise the app table comes first (if configured),
/// followed by each configured study in membership order. Memberships with
/// no fetched config, or an unconfigured one, are skipped.
///
/// # Example
///
/// ```
/// use pvexport::core::export::resolve_destinations;
/// use pvexport::domain::{AppConfig, AppId, ExportSettings};
/// use std::collections::HashMap;
///
/// let app = AppConfig::new(
///     AppId::new("api").unwrap(),
///     ExportSettings::new(Some(true), Some("T_APP")),
/// );
/// let destinations = resolve_destinations(&app, &HashMap::new(), []);
/// assert_eq!(destinations.len(), 1);
/// assert!(destinations[0].is_app_level());
/// ```
pub fn resolve_destinations<'a>(
    app: &AppConfig,
    studies: &HashMap<StudyId, StudyConfig>,
    memberships: impl IntoIterator<Item = &'a StudyId>,
) -> Vec<Destination> {
    if !app.export.is_enabled() {
        return Vec::new();
    }

    let mut destinations = Vec::new();

    if let Some(table_id) = app.export.configured_table() {
        destinations.push(Destination::for_app(table_id));
    }

    for study_id in memberships {
        let Some(study) = studies.get(study_id) else {
            continue;
        };
        if let Some(table_id) = study.export.configured_table() {
            destinations.push(Destination::for_study(study_id.clone(), table_id));
        }
    }

    destinations
}
