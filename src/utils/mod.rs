pub mod git;
pub mod html;
