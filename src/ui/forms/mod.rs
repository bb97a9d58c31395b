//! Form rendering module
//!
//! - `adapter`: the contract shared by all inputs
//! - `field_renderer`: field rendering utilities
//! - one module per input kind
//! - `page`: a titled form holding a context and its adapters
//! - `schemas`: the form for each record kind

mod adapter;
mod button_group;
mod checkbox_list;
mod chips;
mod date;
mod field_renderer;
mod page;
mod schemas;
mod select;
mod submit;
mod switch;
mod text;

pub use adapter::{InputAdapter, Visibility};
pub use button_group::ButtonGroup;
pub use checkbox_list::CheckboxList;
pub use chips::ChipSelect;
pub use date::DateInput;
pub use page::{FormPage, PageAction};
pub use schemas::build_form;
pub use select::SelectInput;
pub use submit::SubmitButton;
pub use switch::SwitchInput;
pub use text::{NumericBounds, TextInput};
