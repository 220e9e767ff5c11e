mod client;

pub use client::NaverClient;
