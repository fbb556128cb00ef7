//! Markup generation for comic pages and the EPUB index documents.
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time templating.
//! Comic titles and alt text come straight from the remote site, so the
//! auto-escaping matters: a title containing `<` or `&` must not corrupt
//! the XHTML or the package manifest.
//!
//! Four documents are produced:
//!
//! - [`comic_page`] — one XHTML page per comic, image at logical size with
//!   the alt text printed below it (e-ink readers have no hover).
//! - [`package_document`] — `OEBPS/content.opf`, the EPUB3 package manifest
//!   and spine.
//! - [`ncx_document`] — `OEBPS/toc.ncx`, the EPUB2 table of contents kept for
//!   older reader firmware.
//! - [`nav_document`] — `OEBPS/nav.xhtml`, the EPUB3 navigation document.
//!
//! All functions are pure: inputs in, markup string out.

use crate::fetch::RenderedComic;
use maud::{DOCTYPE, Markup, PreEscaped, html};

const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n";

const NCX_DOCTYPE: &str = "<!DOCTYPE ncx PUBLIC \"-//NISO//DTD ncx 2005-1//EN\" \
                           \"http://www.daisy.org/z3986/2005/ncx-2005-1.dtd\">\n";

/// Display label used in tables of contents: `#2748: Title`.
fn toc_label(number: u32, title: &str) -> String {
    format!("#{number}: {title}")
}

/// Book title derived from the window bounds.
fn book_title(first: u32, last: u32) -> String {
    format!("xkcd #{first}-#{last}")
}

/// Stable package identifier for a window.
fn book_identifier(first: u32, last: u32) -> String {
    format!("urn:xkcd:{first}-{last}")
}

/// Render one comic as a standalone XHTML page.
///
/// `width` and `height` are the logical (CSS pixel) dimensions — already
/// halved by the fetcher when a 2x image was downloaded.
pub fn comic_page(
    number: u32,
    title: &str,
    alt: &str,
    image_name: &str,
    width: u32,
    height: u32,
) -> String {
    let page: Markup = html! {
        (PreEscaped(XML_DECLARATION))
        (DOCTYPE)
        html xmlns="http://www.w3.org/1999/xhtml" {
            head {
                title { (toc_label(number, title)) }
                link rel="stylesheet" type="text/css" href="style.css" {}
            }
            body {
                section class="comic" {
                    h1 { (toc_label(number, title)) }
                    img src=(image_name) alt=(alt)
                        width=(width) height=(height) {}
                    p class="alt" { (alt) }
                }
            }
        }
    };
    page.into_string()
}

/// The OPF package document: metadata, manifest, and spine.
///
/// Manifest items and spine references are generated from the same comic
/// slice the assembler writes entries from, so the two cannot drift apart.
pub fn package_document(comics: &[RenderedComic], first: u32, last: u32, generated_at: &str) -> String {
    let package: Markup = html! {
        (PreEscaped(XML_DECLARATION))
        package xmlns="http://www.idpf.org/2007/opf" version="3.0" unique-identifier="pub-id" {
            metadata xmlns:dc="http://purl.org/dc/elements/1.1/" {
                dc:identifier id="pub-id" { (book_identifier(first, last)) }
                dc:title { (book_title(first, last)) }
                dc:creator { "Randall Munroe" }
                dc:language { "en" }
                meta property="dcterms:modified" { (generated_at) }
                meta name="cover" content="cover" {}
            }
            manifest {
                item id="ncx" href="toc.ncx" media-type="application/x-dtbncx+xml" {}
                item id="nav" href="nav.xhtml" media-type="application/xhtml+xml" properties="nav" {}
                item id="cover" href="cover.jpg" media-type="image/jpeg" properties="cover-image" {}
                item id="css" href="style.css" media-type="text/css" {}
                item id="font" href="xkcd-script.ttf" media-type="font/ttf" {}
                @for comic in comics {
                    item id=(format!("comic-{}", comic.number))
                        href=(format!("{}.xhtml", comic.number))
                        media-type="application/xhtml+xml" {}
                    item id=(format!("img-{}", comic.number))
                        href=(comic.image_name)
                        media-type="image/png" {}
                }
            }
            spine toc="ncx" {
                @for comic in comics {
                    itemref idref=(format!("comic-{}", comic.number)) {}
                }
            }
        }
    };
    package.into_string()
}

/// The EPUB2 NCX table of contents, one navPoint per comic.
pub fn ncx_document(comics: &[RenderedComic], first: u32, last: u32) -> String {
    let ncx: Markup = html! {
        (PreEscaped(XML_DECLARATION))
        (PreEscaped(NCX_DOCTYPE))
        ncx xmlns="http://www.daisy.org/z3986/2005/ncx/" version="2005-1" {
            head {
                meta name="dtb:uid" content=(book_identifier(first, last)) {}
                meta name="dtb:depth" content="1" {}
                meta name="dtb:totalPageCount" content="0" {}
                meta name="dtb:maxPageNumber" content="0" {}
            }
            docTitle {
                text { (book_title(first, last)) }
            }
            navMap {
                @for (order, comic) in comics.iter().enumerate() {
                    navPoint id=(format!("comic-{}", comic.number)) playOrder=((order + 1).to_string()) {
                        navLabel {
                            text { (toc_label(comic.number, &comic.title)) }
                        }
                        content src=(format!("{}.xhtml", comic.number)) {}
                    }
                }
            }
        }
    };
    ncx.into_string()
}

/// The EPUB3 navigation document.
pub fn nav_document(comics: &[RenderedComic], first: u32, last: u32) -> String {
    let nav: Markup = html! {
        (PreEscaped(XML_DECLARATION))
        (DOCTYPE)
        html xmlns="http://www.w3.org/1999/xhtml" xmlns:epub="http://www.idpf.org/2007/ops" {
            head {
                title { (book_title(first, last)) }
            }
            body {
                nav epub:type="toc" {
                    h1 { (book_title(first, last)) }
                    ol {
                        @for comic in comics {
                            li {
                                a href=(format!("{}.xhtml", comic.number)) {
                                    (toc_label(comic.number, &comic.title))
                                }
                            }
                        }
                    }
                }
            }
        }
    };
    nav.into_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::{FetchOutcome, RenderedComic};
    use std::path::PathBuf;

    fn comic(number: u32, title: &str) -> RenderedComic {
        RenderedComic {
            number,
            title: title.to_string(),
            alt: format!("alt for {number}"),
            image_name: format!("{number}.png"),
            image_path: PathBuf::from(format!("/cache/{number}.png")),
            html: String::new(),
            outcome: FetchOutcome::Complete,
        }
    }

    // =========================================================================
    // Comic page
    // =========================================================================

    #[test]
    fn comic_page_embeds_image_at_logical_size() {
        let page = comic_page(327, "Exploits of a Mom", "Her daughter", "327.png", 666, 205);
        assert!(page.contains(r#"src="327.png""#));
        assert!(page.contains(r#"width="666""#));
        assert!(page.contains(r#"height="205""#));
        assert!(page.contains("#327: Exploits of a Mom"));
    }

    #[test]
    fn comic_page_escapes_markup_in_title_and_alt() {
        let page = comic_page(1, "a <b> & c", "x < y", "1.png", 10, 10);
        assert!(page.contains("a &lt;b&gt; &amp; c"));
        assert!(page.contains("x &lt; y"));
        assert!(!page.contains("a <b> & c"));
    }

    #[test]
    fn comic_page_starts_with_xml_declaration() {
        let page = comic_page(1, "t", "a", "1.png", 1, 1);
        assert!(page.starts_with("<?xml version=\"1.0\""));
    }

    // =========================================================================
    // Package document
    // =========================================================================

    #[test]
    fn package_lists_every_comic_in_manifest_and_spine() {
        let comics = vec![comic(10, "ten"), comic(9, "nine")];
        let opf = package_document(&comics, 9, 10, "2026-08-24T00:00:00Z");

        for n in [10, 9] {
            assert!(opf.contains(&format!(r#"id="comic-{n}""#)));
            assert!(opf.contains(&format!(r#"href="{n}.xhtml""#)));
            assert!(opf.contains(&format!(r#"id="img-{n}""#)));
            assert!(opf.contains(&format!(r#"href="{n}.png""#)));
            assert!(opf.contains(&format!(r#"idref="comic-{n}""#)));
        }
    }

    #[test]
    fn package_carries_identifier_and_timestamp() {
        let opf = package_document(&[comic(5, "t")], 1, 5, "2026-08-24T12:00:00Z");
        assert!(opf.contains("urn:xkcd:1-5"));
        assert!(opf.contains("2026-08-24T12:00:00Z"));
    }

    #[test]
    fn package_spine_preserves_input_order() {
        let comics = vec![comic(3, "c"), comic(2, "b"), comic(1, "a")];
        let opf = package_document(&comics, 1, 3, "t");
        let p3 = opf.find(r#"idref="comic-3""#).unwrap();
        let p2 = opf.find(r#"idref="comic-2""#).unwrap();
        let p1 = opf.find(r#"idref="comic-1""#).unwrap();
        assert!(p3 < p2 && p2 < p1);
    }

    // =========================================================================
    // NCX and nav
    // =========================================================================

    #[test]
    fn ncx_play_order_is_sequential() {
        let comics = vec![comic(20, "x"), comic(19, "y")];
        let ncx = ncx_document(&comics, 19, 20);
        assert!(ncx.contains(r#"playOrder="1""#));
        assert!(ncx.contains(r#"playOrder="2""#));
        assert!(ncx.contains("#20: x"));
        assert!(ncx.contains(r#"src="19.xhtml""#));
    }

    #[test]
    fn nav_links_every_comic() {
        let comics = vec![comic(2, "two"), comic(1, "one")];
        let nav = nav_document(&comics, 1, 2);
        assert!(nav.contains(r#"href="2.xhtml""#));
        assert!(nav.contains(r#"href="1.xhtml""#));
        assert!(nav.contains("epub:type"));
    }
}
