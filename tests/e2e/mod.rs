// End-to-end tests for the resume tailoring API.
//
// One PostgreSQL container is shared by the whole suite. Each test leases an
// isolated database from a pool (see helpers::db_pool) through test-context,
// starts the router on an ephemeral port and talks to it over hyper. The LLM
// is a scripted in-memory completion provider and the payment providers are
// served by a per-test wiremock server.

mod helpers;
mod test_applications;
mod test_billing;
mod test_coaching;
mod test_generate;
mod test_profile;
