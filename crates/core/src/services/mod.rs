mod installation;
mod report;
mod trial;

pub use installation::{InstallationError, InstallationService};
pub use report::{
    ClockifyContext, InvoiceDetails, PreviewSettings, ReportError, ReportPreview, ReportService,
};
pub use trial::{TrialError, TrialService, DEFAULT_DOWNLOAD_LIMIT};
