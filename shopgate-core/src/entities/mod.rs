pub mod webhook_events;
