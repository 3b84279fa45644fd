use heapless::String;
use serde::{Deserialize, Deserializer, de::Error as _};

use crate::{core::text::truncated, domain::entity::Switch};

/// Longest command name kept for logging an unknown command
pub const COMMAND_MAX_LEN: usize = 16;

/// Decoded control request body.
///
/// Strings borrow from the request body, so their length is only bounded
/// by the body buffer. Unknown keys are skipped by the decoder.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ControlRequest<'a> {
    pub auth: Option<&'a str>,
    #[serde(borrow)]
    pub state: Option<StatePatch<'a>>,
    pub cmd: Option<&'a str>,
}

impl ControlRequest<'_> {
    /// Command carried by the request, if any
    pub fn command(&self) -> Option<Command> {
        self.cmd.map(Command::parse)
    }
}

/// Partial light state.
///
/// `None` means no change, whether the key was absent or `null`. Integer
/// fields take any JSON number and drop its fraction.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StatePatch<'a> {
    #[serde(rename = "switch")]
    pub power: Option<Switch>,
    #[serde(default, deserialize_with = "number")]
    pub red: Option<i32>,
    #[serde(default, deserialize_with = "number")]
    pub green: Option<i32>,
    #[serde(default, deserialize_with = "number")]
    pub blue: Option<i32>,
    pub hex: Option<&'a str>,
    pub hue: Option<f64>,
    pub saturation: Option<f64>,
    #[serde(default, deserialize_with = "number")]
    pub level: Option<i32>,
    #[serde(default, deserialize_with = "number")]
    pub frequency: Option<u32>,
    #[serde(default, deserialize_with = "number")]
    pub fadetime: Option<u32>,
}

/// Decode a JSON number into an integer, truncating toward zero.
///
/// Values outside the target type are rejected.
fn number<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<i64>,
{
    let Some(value) = Option::<f64>::deserialize(deserializer)? else {
        return Ok(None);
    };
    if !value.is_finite() {
        return Err(D::Error::custom("number out of range"));
    }
    T::try_from(libm::trunc(value) as i64)
        .map(Some)
        .map_err(|_| D::Error::custom("number out of range"))
}

/// Post-response command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Reboot the node
    Reset,
    /// Run the hue sweep
    Demo,
    /// Anything else, ignored. Long names are cut.
    Unknown(String<COMMAND_MAX_LEN>),
}

impl Command {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "reset" => Command::Reset,
            "demo" => Command::Demo,
            other => Command::Unknown(truncated(other)),
        }
    }
}
