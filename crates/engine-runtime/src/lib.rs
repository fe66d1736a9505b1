pub mod batch;
pub mod error;

#[cfg(test)]
mod tests;
