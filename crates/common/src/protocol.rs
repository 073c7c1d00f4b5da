//! Records exchanged with the transport layer.
//!
//! The transport layer owns HTTP and XML parsing. It hands the core an
//! [`IncomingPayload`] built from query parameters plus the parsed callback
//! body, and receives an [`EncryptedReply`] to render as the response body.

use serde::{Deserialize, Serialize};

use crate::error::CryptoError;

// ---------------------------------------------------------------------------
// Incoming payload
// ---------------------------------------------------------------------------

/// Where the ciphertext of an inbound request came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CiphertextSource {
    /// URL verification probe: the ciphertext is the `echostr` query parameter.
    EchoProbe(String),
    /// Regular callback: the ciphertext is the `<Encrypt>` element of the body.
    CallbackEnvelope(String),
}

impl CiphertextSource {
    /// The base64 ciphertext regardless of origin.
    pub fn ciphertext(&self) -> &str {
        match self {
            CiphertextSource::EchoProbe(c) | CiphertextSource::CallbackEnvelope(c) => c,
        }
    }
}

/// An inbound callback request, reduced to the fields the core consumes.
///
/// Deserialises from the transport record shape:
///
/// ```json
/// { "echostr": "...", "xml": { "Encrypt": "..." },
///   "timestamp": "...", "nonce": "...", "msg_signature": "..." }
/// ```
///
/// `echostr` wins when both ciphertext fields are present. Unknown fields
/// (account identifiers, `ToUserName`, `AgentID`, ...) are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawPayload")]
pub struct IncomingPayload {
    pub source: CiphertextSource,
    pub timestamp: String,
    pub nonce: String,
    /// Signature supplied by the platform. Only consulted by explicit verification.
    pub msg_signature: Option<String>,
}

#[derive(Deserialize)]
struct RawPayload {
    echostr: Option<String>,
    xml: Option<RawBody>,
    timestamp: String,
    nonce: String,
    msg_signature: Option<String>,
}

#[derive(Deserialize)]
struct RawBody {
    #[serde(rename = "Encrypt")]
    encrypt: Option<String>,
}

impl TryFrom<RawPayload> for IncomingPayload {
    type Error = CryptoError;

    fn try_from(raw: RawPayload) -> Result<Self, Self::Error> {
        let source = match (raw.echostr, raw.xml.and_then(|b| b.encrypt)) {
            (Some(echo), _) => CiphertextSource::EchoProbe(echo),
            (None, Some(body)) => CiphertextSource::CallbackEnvelope(body),
            (None, None) => return Err(CryptoError::MissingCiphertext),
        };
        Ok(Self {
            source,
            timestamp: raw.timestamp,
            nonce: raw.nonce,
            msg_signature: raw.msg_signature,
        })
    }
}

// ---------------------------------------------------------------------------
// Outgoing reply
// ---------------------------------------------------------------------------

/// An encrypted, signed reply ready for the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EncryptedReply {
    pub ciphertext: String,
    pub timestamp: String,
    pub nonce: String,
    pub signature: String,
}

impl EncryptedReply {
    /// Render the fixed reply template.
    ///
    /// Field order is fixed; `Encrypt`, `MsgSignature` and `Nonce` are wrapped
    /// in CDATA, `TimeStamp` is not.
    pub fn to_xml(&self) -> String {
        format!(
            "<xml>\n\
             <Encrypt><![CDATA[{}]]></Encrypt>\n\
             <MsgSignature><![CDATA[{}]]></MsgSignature>\n\
             <TimeStamp>{}</TimeStamp>\n\
             <Nonce><![CDATA[{}]]></Nonce>\n\
             </xml>\n",
            self.ciphertext, self.signature, self.timestamp, self.nonce,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn callback_body_is_parsed() {
        let p: IncomingPayload = serde_json::from_value(json!({
            "xml": { "ToUserName": "wx23961585be2ea4d6", "Encrypt": "abc", "AgentID": "25" },
            "msg_signature": "sig",
            "timestamp": "1486718199",
            "nonce": "1354621423",
            "corp_id": "tjc29Q32328e98FnN6"
        }))
        .unwrap();
        assert_eq!(p.source, CiphertextSource::CallbackEnvelope("abc".into()));
        assert_eq!(p.timestamp, "1486718199");
        assert_eq!(p.nonce, "1354621423");
        assert_eq!(p.msg_signature.as_deref(), Some("sig"));
    }

    #[test]
    fn echostr_takes_precedence() {
        let p: IncomingPayload = serde_json::from_value(json!({
            "echostr": "probe",
            "xml": { "Encrypt": "body" },
            "timestamp": "1",
            "nonce": "2"
        }))
        .unwrap();
        assert_eq!(p.source, CiphertextSource::EchoProbe("probe".into()));
        assert_eq!(p.source.ciphertext(), "probe");
        assert!(p.msg_signature.is_none());
    }

    #[test]
    fn missing_ciphertext_is_rejected() {
        let err = serde_json::from_value::<IncomingPayload>(json!({
            "xml": { "ToUserName": "x" },
            "timestamp": "1",
            "nonce": "2"
        }))
        .unwrap_err();
        assert!(err.to_string().contains("no ciphertext"));
    }

    #[test]
    fn reply_template_is_exact() {
        let reply = EncryptedReply {
            ciphertext: "CT".into(),
            timestamp: "1503885600".into(),
            nonce: "N".into(),
            signature: "S".into(),
        };
        assert_eq!(
            reply.to_xml(),
            "<xml>\n\
             <Encrypt><![CDATA[CT]]></Encrypt>\n\
             <MsgSignature><![CDATA[S]]></MsgSignature>\n\
             <TimeStamp>1503885600</TimeStamp>\n\
             <Nonce><![CDATA[N]]></Nonce>\n\
             </xml>\n"
        );
    }
}
