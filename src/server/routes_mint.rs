use crate::server::error::AppError;
use crate::server::{pages, AppContext};
use axum::{
    extract::{multipart::Field, Multipart, State},
    routing::get,
    Router,
};
use maud::Markup;
use mintari_common::Error;

/// Client file name used when the browser does not send one.
const DEFAULT_UPLOAD_NAME: &str = "upload";

pub fn mint_routes() -> Router<AppContext> {
    Router::new()
        .route("/", get(landing))
        .route("/create", get(create_form).post(create_submit))
        .route("/mint", get(mint))
}

async fn landing() -> Markup {
    pages::landing()
}

async fn create_form() -> Markup {
    pages::create_form(None)
}

async fn mint() -> Markup {
    pages::mint()
}

/// An uploaded `image` field.
struct Upload {
    file_name: String,
    data: bytes::Bytes,
}

/// Run the mint workflow on the submitted image and render its preview.
///
/// A submission without an `image` file re-renders the form.
async fn create_submit(
    State(ctx): State<AppContext>,
    multipart: Multipart,
) -> Result<Markup, AppError> {
    let Some(upload) = read_image_field(multipart).await? else {
        tracing::debug!("Submission without an image, showing the form again");
        return Ok(pages::create_form(Some("Please choose an image to upload.")));
    };

    tracing::info!(
        file_name = %upload.file_name,
        bytes = upload.data.len(),
        "Received upload"
    );

    let preview = ctx.workflow.submit(&upload.file_name, &upload.data).await?;
    Ok(pages::preview(&preview))
}

/// Find the first non-empty `image` field, ignoring every other field.
async fn read_image_field(mut multipart: Multipart) -> Result<Option<Upload>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::invalid_input(format!("malformed multipart body: {}", e)))?
    {
        if field.name() != Some("image") {
            continue;
        }

        let upload = read_upload(field).await?;
        if !upload.data.is_empty() {
            return Ok(Some(upload));
        }
    }

    Ok(None)
}

async fn read_upload(field: Field<'_>) -> Result<Upload, AppError> {
    let file_name = field
        .file_name()
        .filter(|name| !name.is_empty())
        .unwrap_or(DEFAULT_UPLOAD_NAME)
        .to_string();
    let data = field
        .bytes()
        .await
        .map_err(|e| Error::invalid_input(format!("failed to read upload: {}", e)))?;

    Ok(Upload { file_name, data })
}
