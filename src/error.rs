use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("not a PDF file: {}", .0.display())]
    NotPdf(PathBuf),
    #[error("invalid topic tree JSON")]
    TreeJson(#[from] serde_json::Error),
    #[error("invalid config file {}: {message}", path.display())]
    Config { path: PathBuf, message: String },
    #[error("failed to parse generated SVG: {0}")]
    SvgParse(String),
    #[error("failed to convert SVG to PDF: {0}")]
    PdfConvert(String),
    #[error("failed to rasterize mind map: {0}")]
    Raster(String),
}

pub type Result<T> = std::result::Result<T, Error>;
