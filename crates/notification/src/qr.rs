use base64::{Engine as _, engine::general_purpose::STANDARD};
use courtside_shared::notify::QrCodeGenerator;
use qrcode::{QrCode, render::svg};

/// Renders check-in links as SVG QR codes, returned as `data:` URLs.
#[derive(Clone, Default)]
pub struct SvgQrCode;

impl QrCodeGenerator for SvgQrCode {
    fn generate(&self, url: &str) -> anyhow::Result<String> {
        let code = QrCode::new(url.as_bytes())?;
        let image = code
            .render::<svg::Color>()
            .min_dimensions(256, 256)
            .build();

        Ok(format!(
            "data:image/svg+xml;base64,{}",
            STANDARD.encode(image)
        ))
    }
}
