pub mod peaks;
