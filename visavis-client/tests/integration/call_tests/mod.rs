mod test_answer_without_call_fails;
mod test_remote_offer_produces_answer;
mod test_start_call_emits_offer;
