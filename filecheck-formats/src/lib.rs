//! Built-in format validators for `filecheck`.
//!
//! Each module performs the minimal structural parse that proves a file of
//! its format is intact:
//! - `excel`: workbook opens and its sheet list loads (`calamine`)
//! - `word`: `.docx` package parts present, main document decompresses
//! - `pdf`: header, xref, trailer and catalog load (`lopdf`)
//! - `raster`: the image decodes fully (`image`)
//! - `archive`: every zip entry decompresses with a matching CRC (`zip`)
//!
//! [`builtin_registry`] wires them into a [`FormatRegistry`].

pub mod archive;
pub mod excel;
mod failure;
pub mod pdf;
pub mod raster;
pub mod word;

use filecheck::{FormatRegistry, RegistryError};

pub use archive::ZipValidator;
pub use excel::ExcelValidator;
pub use pdf::PdfValidator;
pub use raster::ImageValidator;
pub use word::WordValidator;

/// Build a registry holding every built-in format.
///
/// | Format | Extensions |
/// |--------|------------|
/// | excel  | xls, xlsx |
/// | word   | docx |
/// | pdf    | pdf |
/// | image  | jpg, jpeg, png, gif, bmp, ico |
/// | zip    | zip |
///
/// # Errors
///
/// Never fails for the built-in set; the `Result` surfaces a
/// `RegistryError` if the table above ever declares an extension twice.
pub fn builtin_registry() -> Result<FormatRegistry, RegistryError> {
    let mut registry = FormatRegistry::new();
    register_builtin(&mut registry)?;
    Ok(registry)
}

/// Add the built-in formats to an existing registry.
///
/// # Errors
///
/// Returns a `RegistryError` if `registry` already claims one of the
/// built-in format names or extensions.
pub fn register_builtin(registry: &mut FormatRegistry) -> Result<(), RegistryError> {
    registry.register("excel", &["xls", "xlsx"], ExcelValidator)?;
    registry.register("word", &["docx"], WordValidator)?;
    registry.register("pdf", &["pdf"], PdfValidator)?;
    registry.register(
        "image",
        &["jpg", "jpeg", "png", "gif", "bmp", "ico"],
        ImageValidator,
    )?;
    registry.register("zip", &["zip"], ZipValidator)?;
    Ok(())
}
