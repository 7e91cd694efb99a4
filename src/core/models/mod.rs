pub mod pace;
