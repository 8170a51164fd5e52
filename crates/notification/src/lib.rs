mod dispatch;
mod line;
mod log;
mod qr;
mod service;

pub use dispatch::Dispatcher;
pub use line::{LineConfig, LineService};
pub use log::LogNotifier;
pub use qr::SvgQrCode;
pub use service::*;
