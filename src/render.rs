//! HTML rendering with [maud](https://maud.lambda.xyz/).
//!
//! Full pages for the live server, plus [`mobile_gallery`], the card fragment
//! the static build splices into its index template. All interpolation is
//! escaped by maud.

use crate::types::{LinkScheme, Photo, Variant};
use maud::{DOCTYPE, Markup, html};

/// Stands in for the contact key when none is configured.
pub const CONTACT_KEY_PLACEHOLDER: &str = "YOUR_ACCESS_KEY_HERE";

const CONTACT_FORM_ACTION: &str = "https://api.web3forms.com/submit";

/// Number of gallery images loaded eagerly; the rest are lazy.
pub const EAGER_IMAGES: usize = 2;

/// Page layout picked per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Desktop,
    Mobile,
}

fn loading(index: usize) -> &'static str {
    if index < EAGER_IMAGES { "eager" } else { "lazy" }
}

fn script_src() -> String {
    format!("/static/js/script.js?v={}", env!("CARGO_PKG_VERSION"))
}

// ============================================================================
// HTML Components
// ============================================================================

fn base_document(
    title: &str,
    stylesheet: &str,
    body_class: Option<&str>,
    content: Markup,
) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                link rel="stylesheet" href={ "/static/" (stylesheet) };
            }
            body class=[body_class] {
                (content)
                script src=(script_src()) defer {}
            }
        }
    }
}

/// One linked card per photo, newline separated.
pub fn mobile_gallery(photos: &[Photo], scheme: LinkScheme) -> String {
    photos
        .iter()
        .enumerate()
        .map(|(i, photo)| mobile_card(photo, i, scheme).into_string())
        .collect::<Vec<_>>()
        .join("\n")
}

fn mobile_card(photo: &Photo, index: usize, scheme: LinkScheme) -> Markup {
    html! {
        a.mobile-card href=(photo.view_url(scheme)) {
            img src=(photo.url(scheme))
                alt={ "Photo " (index + 1) }
                loading=(loading(index))
                decoding="async";
        }
    }
}

fn desktop_slide(photo: &Photo, index: usize) -> Markup {
    html! {
        a.slide href=(photo.view_url(LinkScheme::Served)) data-index=(index) {
            img src=(photo.url(LinkScheme::Served))
                alt=(photo.filename)
                loading=(loading(index))
                decoding="async";
        }
    }
}

fn contact_form(contact_key: Option<&str>) -> Markup {
    html! {
        section id="contact" {
            h2 { "Contact" }
            form action=(CONTACT_FORM_ACTION) method="POST" {
                input type="hidden" name="access_key" value=(contact_key.unwrap_or(CONTACT_KEY_PLACEHOLDER));
                input type="text" name="name" placeholder="Name" required;
                input type="email" name="email" placeholder="Email" required;
                textarea name="message" placeholder="Message" rows="5" required {}
                button type="submit" { "Send" }
            }
        }
    }
}

// ============================================================================
// Page Renderers
// ============================================================================

pub struct IndexPage<'a> {
    pub layout: Layout,
    pub desktop: &'a [Photo],
    pub mobile: &'a [Photo],
    pub contact_key: Option<&'a str>,
    pub stylesheet: &'a str,
}

pub fn render_index(page: &IndexPage<'_>) -> Markup {
    let content = html! {
        header.site-header {
            a.site-title href="/" { "Gallery" }
            nav {
                a href="/portfolio" { "Portfolio" }
                a href="#contact" { "Contact" }
            }
        }
        main {
            @match page.layout {
                Layout::Mobile => {
                    div.mobile-gallery {
                        @for (i, photo) in page.mobile.iter().enumerate() {
                            (mobile_card(photo, i, LinkScheme::Served))
                        }
                    }
                }
                Layout::Desktop => {
                    div.slideshow data-count=(page.desktop.len()) {
                        @for (i, photo) in page.desktop.iter().enumerate() {
                            (desktop_slide(photo, i))
                        }
                    }
                }
            }
            (contact_form(page.contact_key))
        }
    };
    let body_class = match page.layout {
        Layout::Mobile => "layout-mobile",
        Layout::Desktop => "layout-desktop",
    };
    base_document("Gallery", page.stylesheet, Some(body_class), content)
}

/// Links follow each photo's own variant, so the desktop fallback set still
/// points at `/photos/desktop/`.
pub fn render_portfolio(photos: &[Photo], stylesheet: &str) -> Markup {
    let content = html! {
        header.site-header {
            a.site-title href="/" { "Gallery" }
            h1 { "Portfolio" }
        }
        main.portfolio {
            @for (i, photo) in photos.iter().enumerate() {
                figure.portfolio-item {
                    a href=(photo.view_url(LinkScheme::Served)) {
                        img src=(photo.url(LinkScheme::Served))
                            alt=(photo.filename)
                            loading=(loading(i))
                            decoding="async";
                    }
                }
            }
        }
    };
    base_document("Portfolio", stylesheet, Some("portfolio-page"), content)
}

pub fn render_view(variant: Variant, filename: &str, stylesheet: &str) -> Markup {
    let photo = Photo::new(variant, filename);
    let back = match variant {
        Variant::Portfolio => "/portfolio",
        Variant::Desktop | Variant::Mobile => "/",
    };
    let content = html! {
        main.viewer {
            a id="viewBackLink" href=(back) { "← Back" }
            figure {
                img id="fullsizeImage" src=(photo.url(LinkScheme::Served)) alt=(filename);
                figcaption id="viewCaption" { (filename) }
            }
        }
    };
    base_document(filename, stylesheet, Some("image-view"), content)
}

pub struct DebugPage<'a> {
    pub contact_key_masked: &'a str,
    pub access_key_in_form: &'a str,
    pub env: &'a [(String, String)],
}

pub fn render_debug(page: &DebugPage<'_>) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                title { "Debug" }
            }
            body {
                h1 { "Debug" }
                dl {
                    dt { "WEB3FORMS_KEY" }
                    dd { (page.contact_key_masked) }
                    dt { "access_key (query)" }
                    dd { (page.access_key_in_form) }
                }
                h2 { "Environment" }
                table.env {
                    @for (key, value) in page.env {
                        tr {
                            td { (key) }
                            td { (value) }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photos(variant: Variant, names: &[&str]) -> Vec<Photo> {
        names.iter().map(|n| Photo::new(variant, *n)).collect()
    }

    #[test]
    fn base_document_includes_doctype_and_assets() {
        let doc = base_document("T", "default.css", None, html! { p { "x" } }).into_string();
        assert!(doc.starts_with("<!DOCTYPE html>"));
        assert!(doc.contains(r#"href="/static/default.css""#));
        assert!(doc.contains("/static/js/script.js?v="));
    }

    #[test]
    fn mobile_gallery_marks_first_two_eager() {
        let list = photos(Variant::Mobile, &["1.jpg", "2.jpg", "3.jpg", "4.jpg"]);
        let html = mobile_gallery(&list, LinkScheme::Static);

        assert_eq!(html.lines().count(), 4);
        assert_eq!(html.matches(r#"loading="eager""#).count(), 2);
        assert_eq!(html.matches(r#"loading="lazy""#).count(), 2);
        assert!(html.lines().next().unwrap().contains(r#"alt="Photo 1""#));
        assert!(html.contains(r#"src="assets/photos/mobile/3.jpg""#));
        assert!(html.contains(r#"href="view/?variant=mobile&amp;file=4.jpg""#));
    }

    #[test]
    fn mobile_gallery_empty() {
        assert_eq!(mobile_gallery(&[], LinkScheme::Static), "");
    }

    #[test]
    fn index_mobile_layout_shows_mobile_photos() {
        let desktop = photos(Variant::Desktop, &["wide.jpg"]);
        let mobile = photos(Variant::Mobile, &["tall.jpg"]);
        let html = render_index(&IndexPage {
            layout: Layout::Mobile,
            desktop: &desktop,
            mobile: &mobile,
            contact_key: Some("pub-key"),
            stylesheet: "default.css",
        })
        .into_string();

        assert!(html.contains("/photos/mobile/tall.jpg"));
        assert!(!html.contains("wide.jpg"));
        assert!(html.contains("layout-mobile"));
        assert!(html.contains(r#"value="pub-key""#));
    }

    #[test]
    fn index_desktop_layout_uses_placeholder_without_key() {
        let desktop = photos(Variant::Desktop, &["wide.jpg"]);
        let html = render_index(&IndexPage {
            layout: Layout::Desktop,
            desktop: &desktop,
            mobile: &[],
            contact_key: None,
            stylesheet: "default.css",
        })
        .into_string();

        assert!(html.contains("/view/desktop/wide.jpg"));
        assert!(html.contains(CONTACT_KEY_PLACEHOLDER));
    }

    #[test]
    fn view_page_references_photo() {
        let html = render_view(Variant::Portfolio, "a b.jpg", "default.css").into_string();
        assert!(html.contains(r#"src="/photos/portfolio/a%20b.jpg""#));
        assert!(html.contains(r#"href="/portfolio""#));
    }

    #[test]
    fn filenames_are_escaped() {
        let html = render_view(Variant::Desktop, "<script>.jpg", "default.css").into_string();
        assert!(!html.contains("<script>.jpg"));
        assert!(html.contains("&lt;script&gt;.jpg"));
    }

    #[test]
    fn debug_page_lists_env() {
        let env = vec![("HOME".to_string(), "/root".to_string())];
        let html = render_debug(&DebugPage {
            contact_key_masked: "abcde***",
            access_key_in_form: "",
            env: &env,
        })
        .into_string();
        assert!(html.contains("abcde***"));
        assert!(html.contains("<td>HOME</td><td>/root</td>"));
    }
}
