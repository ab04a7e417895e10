pub mod boardobj;
pub mod clk;
