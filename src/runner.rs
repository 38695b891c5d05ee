//! Upload step: resolve inputs, delegate the upload, report the outcome.

use std::any::Any;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;

use crate::action::ActionOutput;
use crate::bee::{Connect, DirectoryUploader, UploadResult};
use crate::core::StepError;
use crate::inputs::{InputSource, RunInputs};
use crate::utils::redact_node_url;

/// Output carrying the content reference
pub const REFERENCE_OUTPUT: &str = "reference";
/// Output carrying the tag uid
pub const TAG_UID_OUTPUT: &str = "tagUid";

/// Upload the resolved directory and publish `reference` and `tagUid`.
///
/// Any failure is logged and signaled on `outputs` exactly once before it is
/// returned.
pub async fn run<C: Connect>(
    inputs: &RunInputs,
    connector: &C,
    outputs: &mut dyn ActionOutput,
) -> Result<UploadResult, StepError> {
    tracing::info!(
        bee_url = %redact_node_url(&inputs.bee_url),
        "Uploading directory {} with postage batch {}",
        inputs.dir.display(),
        inputs.postage_batch_id
    );

    match upload_and_publish(inputs, connector, outputs).await {
        Ok(result) => Ok(result),
        Err(err) => {
            tracing::error!("{}", upload_message(&err));
            outputs.set_failed(&err.to_string());
            Err(err)
        }
    }
}

async fn upload_and_publish<C: Connect>(
    inputs: &RunInputs,
    connector: &C,
    outputs: &mut dyn ActionOutput,
) -> Result<UploadResult, StepError> {
    let client = connector.connect(&inputs.bee_url, &inputs.headers)?;
    let result = client
        .upload_files_from_directory(
            &inputs.postage_batch_id,
            &inputs.dir,
            &inputs.options,
            &inputs.request_options,
        )
        .await?;

    let tag_uid = result.tag_uid.map(|tag| tag.to_string()).unwrap_or_default();
    tracing::info!("Uploaded {}: reference {}, tag {}", inputs.dir.display(), result.reference, tag_uid);

    outputs
        .set_outputs(&[(REFERENCE_OUTPUT, result.reference.as_str()), (TAG_UID_OUTPUT, tag_uid.as_str())])
        .map_err(|e| StepError::Upload(format!("failed to set outputs: {}", e)))?;

    Ok(result)
}

fn upload_message(err: &StepError) -> String {
    match err {
        StepError::Upload(message) => message.clone(),
        other => other.to_string(),
    }
}

/// Run the whole step against an input source.
///
/// Input failures are signaled as `Error running main: ...` without
/// contacting the node. A panic anywhere in the step is caught and signaled
/// instead of tearing down the process.
pub async fn execute<C: Connect>(
    source: &dyn InputSource,
    connector: &C,
    outputs: &mut dyn ActionOutput,
) -> Result<UploadResult, StepError> {
    let outcome = AssertUnwindSafe(step(source, connector, &mut *outputs))
        .catch_unwind()
        .await;

    match outcome {
        Ok(result) => result,
        Err(payload) => {
            let err = StepError::Unhandled(panic_message(payload.as_ref()));
            tracing::error!("{}", err);
            outputs.set_failed(&err.to_string());
            Err(err)
        }
    }
}

async fn step<C: Connect>(
    source: &dyn InputSource,
    connector: &C,
    outputs: &mut dyn ActionOutput,
) -> Result<UploadResult, StepError> {
    let inputs = match RunInputs::resolve(source) {
        Ok(inputs) => inputs,
        Err(err) => {
            let err = StepError::Main(err);
            tracing::error!("{}", err);
            outputs.set_failed(&err.to_string());
            return Err(err);
        }
    };

    run(&inputs, connector, outputs).await
}

/// Render a panic payload as text
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
