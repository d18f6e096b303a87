mod app;
mod audio;
mod config;
mod error;
mod fetch;
mod library;
mod resolver;
mod runtime;

#[cfg(test)]
mod test_utils;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()
}
