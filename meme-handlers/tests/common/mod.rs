pub mod mock_avatars;
pub mod mock_bot;
