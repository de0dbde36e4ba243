mod exchange;
pub(crate) mod local_search;
mod make_active;
mod make_inactive;
pub(crate) mod operator;
mod or_opt;
mod relocate;
mod two_opt;
