use crate::model::Color;
use tabula::{TypeAdapter, TypeAdapterError, type_adapter};

///
/// ColorAdapter
/// Stores colors by lowercase name.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct ColorAdapter;

#[type_adapter]
impl TypeAdapter<Color, String> for ColorAdapter {
    fn serialize(&self, value: &Color) -> String {
        match value {
            Color::Grey => "grey",
            Color::Red => "red",
            Color::Green => "green",
            Color::Blue => "blue",
        }
        .to_string()
    }

    fn deserialize(&self, value: String) -> Result<Color, TypeAdapterError> {
        match value.as_str() {
            "grey" => Ok(Color::Grey),
            "red" => Ok(Color::Red),
            "green" => Ok(Color::Green),
            "blue" => Ok(Color::Blue),
            other => Err(TypeAdapterError::invalid::<Color>(format!("unknown color '{other}'"))),
        }
    }
}
