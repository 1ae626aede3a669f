//! Server-rendered HTML pages.

use maud::{html, Markup, DOCTYPE};

use crate::workflow::MintPreview;

fn layout(title: &str, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) " · Mintari" }
            }
            body {
                header {
                    nav {
                        a href="/" { "Home" }
                        " "
                        a href="/create" { "Create" }
                        " "
                        a href="/mint" { "Mint" }
                    }
                }
                main { (body) }
            }
        }
    }
}

pub fn landing() -> Markup {
    layout(
        "Welcome",
        html! {
            h1 { "Mintari" }
            p { "Turn a photo into a stylized artwork and mint it as an NFT." }
            a href="/create" { "Get started" }
        },
    )
}

/// The upload form. `notice` is shown above the form when set.
pub fn create_form(notice: Option<&str>) -> Markup {
    layout(
        "Create",
        html! {
            h1 { "Upload an image" }
            @if let Some(notice) = notice {
                p class="notice" { (notice) }
            }
            form method="post" action="/create" enctype="multipart/form-data" {
                input type="file" name="image" accept="image/*" required;
                button type="submit" { "Stylize" }
            }
        },
    )
}

pub fn preview(preview: &MintPreview) -> Markup {
    layout(
        "Preview",
        html! {
            h1 { "Your artwork" }
            img src=(preview.image_url) alt="Stylized image";
            dl {
                dt { "Record" }
                dd class="record-id" { (preview.record.id) }
                dt { "Created" }
                dd { (preview.record.created_at.format("%Y-%m-%d %H:%M:%S UTC")) }
                @if let Some(locator) = preview.display_locator() {
                    dt { "Storage locator" }
                    dd class="locator" { (locator) }
                }
            }
            a href="/mint" { "Mint this image" }
        },
    )
}

pub fn mint() -> Markup {
    layout(
        "Mint",
        html! {
            h1 { "Mint your NFT" }
            p { "Connect your wallet to mint the artwork you created." }
        },
    )
}
