pub mod complaint_311;
