//! Answer service implementations for the research library.

#[cfg(feature = "perplexity")]
mod perplexity;

#[cfg(feature = "perplexity")]
pub use perplexity::PerplexityAnswerService;
