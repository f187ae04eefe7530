use crate::domain::model::RawUser;
use crate::utils::error::{EtlError, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use serde::Deserialize;

const ROOT_ELEMENT: &str = "users";

#[derive(Debug, Deserialize)]
#[serde(rename = "users")]
struct UsersDocument {
    #[serde(rename = "user", default)]
    users: Vec<RawUser>,
}

/// Parses a `<users>` document into raw records, in document order.
pub fn parse_users(data: &[u8]) -> Result<Vec<RawUser>> {
    if data.is_empty() {
        return Err(EtlError::EmptyData);
    }

    let text = std::str::from_utf8(data)?;
    if let Some(root) = root_element(text) {
        if root != ROOT_ELEMENT {
            return Err(EtlError::UnexpectedRoot { found: root });
        }
    }
    let document: UsersDocument = quick_xml::de::from_str(text)?;

    if document.users.is_empty() {
        return Err(EtlError::NoRecords);
    }

    tracing::debug!("Parsed {} users from XML", document.users.len());
    Ok(document.users)
}

/// Name of the first element, or `None` if the reader fails before one;
/// syntax errors are left to the deserializer to report.
fn root_element(text: &str) -> Option<String> {
    let mut reader = Reader::from_str(text);
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                return Some(String::from_utf8_lossy(e.local_name().as_ref()).into_owned())
            }
            Ok(Event::Eof) | Err(_) => return None,
            Ok(_) => {}
        }
    }
}
