use std::borrow::Cow;

use research_core::control::ToolError;
use rmcp::ErrorData;
use rmcp::model::ErrorCode;

pub fn mcp_err(code: ErrorCode, message: impl Into<Cow<'static, str>>) -> ErrorData {
    ErrorData {
        code,
        message: message.into(),
        data: None,
    }
}

pub fn map_err(err: ToolError) -> ErrorData {
    tracing::error!(error = %err, "tool call failed");
    mcp_err(ErrorCode::INTERNAL_ERROR, err.to_string())
}
