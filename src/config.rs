use clap::Parser;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

#[derive(Debug, Clone, Parser)]
#[command(
    name = "invoice_uploader",
    version,
    about = "Upload an invoice to the extraction service and review the extracted fields"
)]
pub struct AppConfig {
    /// Base address of the extraction service, also used to build the XML links
    #[arg(long, env = "INVOICE_SERVICE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, env = "INVOICE_UPLOADER_LOG", default_value = "info")]
    pub log_filter: String,

    /// Probe the service's health endpoint at startup
    #[arg(long)]
    pub check_health: bool,
}

impl AppConfig {
    /// Without a trailing slash, so service paths can be appended directly.
    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}
