//! Drawing: the raster surface, the read-only draw pass over fireworks and
//! the terminal presenter.

pub mod draw;
pub mod surface;
pub mod terminal;

pub use draw::draw_fireworks;
pub use surface::Surface;
pub use terminal::TerminalPresenter;
