//! MCP Tool Handlers
//!
//! Each handler performs its DIP round trip(s) through [`DipClient`] and
//! renders the answer as text for the chat client.

use bt_dip::DipClient;
use serde::Deserialize;
use serde_json::Value;

use crate::tools::{GET_LATEST_PROTOCOL, GET_LATEST_PROTOCOL_XML, GET_PROTOCOL_SPEECH};
use crate::{Error, Result};

/// Handle a tool call by dispatching to the appropriate handler
pub async fn handle_tool_call(client: &DipClient, tool_name: &str, arguments: Value) -> Result<String> {
    match tool_name {
        GET_LATEST_PROTOCOL => handle_latest_protocol(client).await,
        GET_LATEST_PROTOCOL_XML => handle_latest_protocol_xml(client).await,
        GET_PROTOCOL_SPEECH => handle_protocol_speech(client, arguments).await,
        _ => Err(Error::UnknownTool(tool_name.to_string())),
    }
}

/// Handle get_latest_protocol - summary of the newest plenary protocol
async fn handle_latest_protocol(client: &DipClient) -> Result<String> {
    let record = client.latest_protocol().await?;
    Ok(record.to_string())
}

/// Handle get_latest_protocol_xml - raw transcript of the newest protocol
async fn handle_latest_protocol_xml(client: &DipClient) -> Result<String> {
    let record = client.latest_protocol().await?;
    tracing::info!(nummer = %record.nummer, datum = %record.datum, "Using protocol");
    Ok(client.protocol_xml(&record).await?)
}

/// Arguments for get_protocol_speech
#[derive(Debug, Deserialize)]
struct SpeechArgs {
    speech_id: String,
}

/// Handle get_protocol_speech - one speech of the newest protocol as JSON
async fn handle_protocol_speech(client: &DipClient, arguments: Value) -> Result<String> {
    let args: SpeechArgs = serde_json::from_value(arguments).map_err(|e| Error::InvalidArguments {
        message: e.to_string(),
    })?;
    let speech_id = args.speech_id.trim();
    if speech_id.is_empty() {
        return Err(Error::InvalidArguments {
            message: "speech_id must not be empty".to_string(),
        });
    }

    let (record, document) = client.latest_protocol_document().await?;
    let speech = document
        .speech(speech_id)
        .ok_or_else(|| bt_dip::Error::SpeechNotFound {
            id: speech_id.to_string(),
            nummer: record.nummer.clone(),
        })?;

    Ok(serde_json::to_string_pretty(&speech)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bt_dip::DipConfig;
    use serde_json::json;
    use std::time::Duration;

    fn offline_client() -> DipClient {
        DipClient::new(DipConfig::new(
            Some("k".to_string()),
            "http://127.0.0.1:9/api/v1",
            Duration::from_secs(1),
        ))
        .unwrap()
    }

    #[tokio::test]
    async fn unknown_tool_is_rejected() {
        let err = handle_tool_call(&offline_client(), "get_weather", json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::UnknownTool(ref name) if name == "get_weather"));
    }

    #[tokio::test]
    async fn speech_requires_argument() {
        let err = handle_tool_call(&offline_client(), GET_PROTOCOL_SPEECH, json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArguments { .. }));
    }

    #[tokio::test]
    async fn speech_rejects_blank_id() {
        let err = handle_tool_call(&offline_client(), GET_PROTOCOL_SPEECH, json!({"speech_id": " "}))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("must not be empty"));
    }
}
