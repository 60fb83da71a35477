pub mod graphql;
pub mod jwt;
pub mod routes;
