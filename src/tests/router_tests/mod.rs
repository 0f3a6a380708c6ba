mod disaster_tests;
mod event_tests;
mod geocode_tests;
mod official_updates_tests;
mod report_tests;
mod resource_tests;
mod social_tests;
