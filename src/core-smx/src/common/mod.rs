pub mod fetch_timeout;
pub mod logging;
