pub mod logo;
pub mod playlist_view;
pub mod util;

pub use logo::logo;
