pub use super::essay_likes::Entity as EssayLikes;
pub use super::essays::Entity as Essays;
pub use super::peer_reviews::Entity as PeerReviews;
pub use super::users::Entity as Users;
