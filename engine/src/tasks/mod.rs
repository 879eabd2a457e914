pub mod iat;
