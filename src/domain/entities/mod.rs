pub mod alumni;
