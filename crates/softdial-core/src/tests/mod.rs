mod dialer;
mod support;
