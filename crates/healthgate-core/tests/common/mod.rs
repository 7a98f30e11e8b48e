pub mod health_server;
