//! Headless interaction state for the screens: the optimistic like toggle,
//! the comment composer, the blog form with its validation rules, and the
//! paginated browser. Views (here, the CLI shell) bind to these and
//! dispatch to the resource functions.

pub mod blog_form;
pub mod browse;
pub mod comment_form;
pub mod like;
