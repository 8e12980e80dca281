pub mod io;
pub mod models;
pub mod render;


// Re-export key types for easier usage
pub use io::*;
pub use models::page::*;
pub use render::{
    CodeRenderer, ContainerRule, ContainerToken, FencedCodeRenderer, HighlightDecorator, Nesting,
    Pipeline,
};
