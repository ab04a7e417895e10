pub mod clk_freq_domain;
