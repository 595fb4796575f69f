//! darkblue-report — rendered answer-key formats.

pub mod html;
