//! Strategy scenarios against scripted backends.

mod support;

mod chat;
