pub mod border;
pub mod button;
pub mod text;
pub mod text_box;

pub use border::Border;
pub use button::{Button, ClickHandler};
pub use text::Text;
pub use text_box::TextBox;
