//! Zip-based EPUB container assembly.
//!
//! Writes the whole book in a single pass. Entry layout, in order:
//!
//! ```text
//! mimetype                                      # stored, never compressed
//! META-INF/container.xml
//! META-INF/com.apple.ibooks.display-options.xml
//! OEBPS/cover.jpg
//! OEBPS/style.css
//! OEBPS/xkcd-script.ttf
//! OEBPS/content.opf                             # generated package document
//! OEBPS/toc.ncx                                 # generated EPUB2 contents
//! OEBPS/nav.xhtml                               # generated EPUB3 navigation
//! OEBPS/{n}.png                                 # per comic, descending
//! OEBPS/{n}.xhtml
//! ```
//!
//! The `mimetype` entry is an EPUB container requirement: it must be the
//! first entry and must be stored uncompressed so the bytes
//! `application/epub+zip` sit at a fixed offset for format sniffers.
//!
//! Static assets are embedded in the binary at compile time; there is no
//! asset directory to locate at runtime. The generated index documents and
//! the per-comic entries are driven by the same comic slice, which is what
//! keeps manifest, spine, navigation, and entry set consistent.

use crate::cache::RunMarker;
use crate::fetch::RenderedComic;
use crate::render;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use zip::CompressionMethod;
use zip::write::{FileOptions, ZipWriter};

/// Fixed content of the `mimetype` entry.
const MIMETYPE: &str = "application/epub+zip";

const CONTAINER_XML: &[u8] = include_bytes!("../assets/container.xml");
const DISPLAY_OPTIONS_XML: &[u8] = include_bytes!("../assets/com.apple.ibooks.display-options.xml");
const COVER_JPG: &[u8] = include_bytes!("../assets/cover.jpg");
const STYLE_CSS: &[u8] = include_bytes!("../assets/style.css");
const SCRIPT_FONT: &[u8] = include_bytes!("../assets/xkcd-script.ttf");

#[derive(Error, Debug)]
pub enum BookError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("comic image missing from cache: {0}")]
    ImageMissing(PathBuf),
}

/// Assemble the book at `archive_path`.
///
/// `comics` must already be in reading order (descending number); entries are
/// written in exactly that order. `generated_at` is the build timestamp for
/// the package document.
pub fn build_book(
    archive_path: &Path,
    comics: &[RenderedComic],
    bounds: RunMarker,
    generated_at: &str,
) -> Result<(), BookError> {
    let file = File::create(archive_path)?;
    let mut container = ZipWriter::new(file);

    let stored = FileOptions::default().compression_method(CompressionMethod::Stored);
    let deflated = FileOptions::default().compression_method(CompressionMethod::Deflated);

    // Format requirement: first entry, uncompressed.
    container.start_file("mimetype", stored)?;
    container.write_all(MIMETYPE.as_bytes())?;

    container.start_file("META-INF/container.xml", deflated)?;
    container.write_all(CONTAINER_XML)?;
    container.start_file("META-INF/com.apple.ibooks.display-options.xml", deflated)?;
    container.write_all(DISPLAY_OPTIONS_XML)?;
    container.start_file("OEBPS/cover.jpg", deflated)?;
    container.write_all(COVER_JPG)?;
    container.start_file("OEBPS/style.css", deflated)?;
    container.write_all(STYLE_CSS)?;
    container.start_file("OEBPS/xkcd-script.ttf", deflated)?;
    container.write_all(SCRIPT_FONT)?;

    container.start_file("OEBPS/content.opf", deflated)?;
    container.write_all(
        render::package_document(comics, bounds.first, bounds.last, generated_at).as_bytes(),
    )?;
    container.start_file("OEBPS/toc.ncx", deflated)?;
    container.write_all(render::ncx_document(comics, bounds.first, bounds.last).as_bytes())?;
    container.start_file("OEBPS/nav.xhtml", deflated)?;
    container.write_all(render::nav_document(comics, bounds.first, bounds.last).as_bytes())?;

    for comic in comics {
        let image = std::fs::read(&comic.image_path)
            .map_err(|_| BookError::ImageMissing(comic.image_path.clone()))?;
        container.start_file(format!("OEBPS/{}", comic.image_name), deflated)?;
        container.write_all(&image)?;
        container.start_file(format!("OEBPS/{}.xhtml", comic.number), deflated)?;
        container.write_all(comic.html.as_bytes())?;
    }

    container.finish()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::FetchOutcome;
    use std::io::Read;
    use tempfile::TempDir;
    use zip::ZipArchive;

    fn comic(tmp: &TempDir, number: u32) -> RenderedComic {
        let image_path = tmp.path().join(format!("{number}.png"));
        std::fs::write(&image_path, format!("png bytes {number}")).unwrap();
        RenderedComic {
            number,
            title: format!("Comic {number}"),
            alt: format!("Alt {number}"),
            image_name: format!("{number}.png"),
            image_path,
            html: format!("<html>comic {number}</html>"),
            outcome: FetchOutcome::Complete,
        }
    }

    fn open_book(path: &Path) -> ZipArchive<File> {
        ZipArchive::new(File::open(path).unwrap()).unwrap()
    }

    #[test]
    fn mimetype_is_first_stored_and_fixed() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("book.kepub.epub");
        build_book(&path, &[comic(&tmp, 1)], RunMarker { first: 1, last: 1 }, "t").unwrap();

        let mut book = open_book(&path);
        let mut entry = book.by_index(0).unwrap();
        assert_eq!(entry.name(), "mimetype");
        assert_eq!(entry.compression(), CompressionMethod::Stored);
        let mut content = String::new();
        entry.read_to_string(&mut content).unwrap();
        assert_eq!(content, "application/epub+zip");
    }

    #[test]
    fn fixed_entries_present() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("book.kepub.epub");
        build_book(&path, &[comic(&tmp, 2)], RunMarker { first: 2, last: 2 }, "t").unwrap();

        let mut book = open_book(&path);
        for name in [
            "META-INF/container.xml",
            "META-INF/com.apple.ibooks.display-options.xml",
            "OEBPS/cover.jpg",
            "OEBPS/style.css",
            "OEBPS/xkcd-script.ttf",
            "OEBPS/content.opf",
            "OEBPS/toc.ncx",
            "OEBPS/nav.xhtml",
        ] {
            assert!(book.by_name(name).is_ok(), "missing entry {name}");
        }
    }

    #[test]
    fn one_media_and_one_fragment_entry_per_comic() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("book.kepub.epub");
        let comics = vec![comic(&tmp, 12), comic(&tmp, 11), comic(&tmp, 10)];
        build_book(&path, &comics, RunMarker { first: 10, last: 12 }, "t").unwrap();

        let mut book = open_book(&path);
        let names: Vec<String> = (0..book.len())
            .map(|i| book.by_index(i).unwrap().name().to_string())
            .collect();

        for n in [12, 11, 10] {
            assert_eq!(names.iter().filter(|e| **e == format!("OEBPS/{n}.png")).count(), 1);
            assert_eq!(
                names.iter().filter(|e| **e == format!("OEBPS/{n}.xhtml")).count(),
                1
            );
        }
    }

    #[test]
    fn comic_entries_follow_input_order() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("book.kepub.epub");
        let comics = vec![comic(&tmp, 30), comic(&tmp, 29), comic(&tmp, 28)];
        build_book(&path, &comics, RunMarker { first: 28, last: 30 }, "t").unwrap();

        let mut book = open_book(&path);
        let names: Vec<String> = (0..book.len())
            .map(|i| book.by_index(i).unwrap().name().to_string())
            .collect();

        let positions: Vec<usize> = [30, 29, 28]
            .iter()
            .map(|n| {
                names
                    .iter()
                    .position(|e| *e == format!("OEBPS/{n}.xhtml"))
                    .unwrap()
            })
            .collect();
        assert!(positions[0] < positions[1] && positions[1] < positions[2]);
    }

    #[test]
    fn fragment_entry_holds_rendered_html() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("book.kepub.epub");
        build_book(&path, &[comic(&tmp, 7)], RunMarker { first: 7, last: 7 }, "t").unwrap();

        let mut book = open_book(&path);
        let mut entry = book.by_name("OEBPS/7.xhtml").unwrap();
        let mut content = String::new();
        entry.read_to_string(&mut content).unwrap();
        assert_eq!(content, "<html>comic 7</html>");
    }

    #[test]
    fn missing_cached_image_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("book.kepub.epub");
        let mut broken = comic(&tmp, 3);
        std::fs::remove_file(&broken.image_path).unwrap();
        broken.image_path = tmp.path().join("gone.png");

        let result = build_book(&path, &[broken], RunMarker { first: 3, last: 3 }, "t");
        assert!(matches!(result, Err(BookError::ImageMissing(_))));
    }
}
