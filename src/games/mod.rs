pub mod omok;
