mod example_masking;
mod example_simple;
mod example_socket;

use crate::{
  example_masking::example_masking, example_simple::example_simple,
  example_socket::example_socket,
};

fn main() {
  tracing_subscriber::fmt()
    .with_max_level(tracing::Level::DEBUG)
    .init();

  println!("pipelog examples");
  println!("================");

  example_simple();
  example_masking();
  example_socket();
}
