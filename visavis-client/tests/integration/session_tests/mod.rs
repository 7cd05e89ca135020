mod test_full_call_cycle;
mod test_hang_up_releases_call;
