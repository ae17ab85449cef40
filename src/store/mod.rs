//! In-memory store for businesses, reviews and community posts.
//!
//! One mutex guards all three collections and the id counters, so id
//! assignment and list mutation are a single atomic unit. Nothing here
//! survives a restart.

use std::sync::Mutex;

use crate::models::{Business, BusinessDraft, BusinessKind, Post, RegionTriple, Review};

#[derive(Debug, Default)]
struct Inner {
    businesses: Vec<Business>,
    reviews: Vec<Review>,
    posts: Vec<Post>,
    business_id_seq: i64,
    post_id_seq: i64,
}

/// Owned listing store; share via `Arc`.
#[derive(Debug, Default)]
pub struct ListingStore {
    inner: Mutex<Inner>,
}

impl ListingStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // Every operation is a single critical section, so the data stays
        // consistent even if a previous holder panicked
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    // ==================== BUSINESSES ====================

    /// Insert a new listing and return it. Ids are monotonic and never
    /// reused, even after deletion.
    pub fn create_business(&self, owner: &str, approved: bool, draft: BusinessDraft) -> Business {
        let mut inner = self.lock();
        inner.business_id_seq += 1;
        let business = Business::from_draft(inner.business_id_seq, owner, approved, draft);
        inner.businesses.push(business.clone());
        business
    }

    /// Look up a listing by id.
    pub fn business(&self, id: i64) -> Option<Business> {
        self.lock().businesses.iter().find(|b| b.id == id).cloned()
    }

    /// Approved listings of a kind within a region, optionally narrowed to
    /// one category. Pending listings never show up here.
    pub fn filter_businesses(
        &self,
        kind: BusinessKind,
        region: &RegionTriple,
        category: Option<&str>,
    ) -> Vec<Business> {
        self.lock()
            .businesses
            .iter()
            .filter(|b| b.kind == kind && b.approved && b.region == *region)
            .filter(|b| category.map_or(true, |c| b.category == c))
            .cloned()
            .collect()
    }

    /// Sorted distinct categories across all listings of a kind, approved
    /// or not (feeds the category selector).
    pub fn categories(&self, kind: BusinessKind) -> Vec<String> {
        let inner = self.lock();
        let mut categories: Vec<String> = inner
            .businesses
            .iter()
            .filter(|b| b.kind == kind)
            .map(|b| b.category.clone())
            .collect();
        categories.sort();
        categories.dedup();
        categories
    }

    /// Listings owned by a user, regardless of approval state.
    pub fn businesses_owned_by(&self, owner: &str) -> Vec<Business> {
        self.lock()
            .businesses
            .iter()
            .filter(|b| b.owner == owner)
            .cloned()
            .collect()
    }

    /// Every listing (admin dashboard).
    pub fn all_businesses(&self) -> Vec<Business> {
        self.lock().businesses.clone()
    }

    /// Listings awaiting approval.
    pub fn pending_businesses(&self) -> Vec<Business> {
        self.lock()
            .businesses
            .iter()
            .filter(|b| !b.approved)
            .cloned()
            .collect()
    }

    /// Replace a listing's mutable fields; id, owner, approval and paid
    /// state are preserved. Returns the updated listing.
    pub fn update_business(&self, id: i64, draft: BusinessDraft) -> Option<Business> {
        let mut inner = self.lock();
        let business = inner.businesses.iter_mut().find(|b| b.id == id)?;
        business.apply_draft(draft);
        Some(business.clone())
    }

    /// Approve a pending listing.
    pub fn approve_business(&self, id: i64) -> bool {
        let mut inner = self.lock();
        match inner.businesses.iter_mut().find(|b| b.id == id) {
            Some(b) => {
                b.approved = true;
                true
            }
            None => false,
        }
    }

    /// Flip the entry-fee paid flag.
    pub fn mark_paid(&self, id: i64) -> bool {
        let mut inner = self.lock();
        match inner.businesses.iter_mut().find(|b| b.id == id) {
            Some(b) => {
                b.paid = true;
                true
            }
            None => false,
        }
    }

    /// Remove a listing and every review referencing it. Also used for
    /// admin rejection. Returns whether the listing existed.
    pub fn delete_business(&self, id: i64) -> bool {
        let mut inner = self.lock();
        let before = inner.businesses.len();
        inner.businesses.retain(|b| b.id != id);
        let removed = inner.businesses.len() != before;
        if removed {
            inner.reviews.retain(|r| r.business_id != id);
        }
        removed
    }

    // ==================== REVIEWS ====================

    /// Append a review to a listing.
    pub fn add_review(&self, business_id: i64, username: &str, rating: i32, comment: &str) {
        self.lock().reviews.push(Review {
            business_id,
            username: username.to_string(),
            rating,
            comment: comment.to_string(),
        });
    }

    /// Reviews for one listing, in insertion order.
    pub fn reviews_for(&self, business_id: i64) -> Vec<Review> {
        self.lock()
            .reviews
            .iter()
            .filter(|r| r.business_id == business_id)
            .cloned()
            .collect()
    }

    /// Every review (admin dashboard).
    pub fn all_reviews(&self) -> Vec<Review> {
        self.lock().reviews.clone()
    }

    // ==================== POSTS ====================

    /// Insert a community post and return it.
    pub fn add_post(
        &self,
        title: &str,
        content: &str,
        user: &str,
        region: RegionTriple,
        image_url: Option<String>,
    ) -> Post {
        let mut inner = self.lock();
        inner.post_id_seq += 1;
        let post = Post {
            id: inner.post_id_seq,
            title: title.to_string(),
            content: content.to_string(),
            user: user.to_string(),
            region,
            image_url,
        };
        inner.posts.push(post.clone());
        post
    }

    /// Posts within one region, in insertion order.
    pub fn posts_in(&self, region: &RegionTriple) -> Vec<Post> {
        self.lock()
            .posts
            .iter()
            .filter(|p| p.region == *region)
            .cloned()
            .collect()
    }

    /// Every post (admin dashboard).
    pub fn all_posts(&self) -> Vec<Post> {
        self.lock().posts.clone()
    }
}

/// Average rating for a set of reviews; `None` when there are none.
pub fn average_rating(reviews: &[Review]) -> Option<f64> {
    if reviews.is_empty() {
        return None;
    }
    let sum: i64 = reviews.iter().map(|r| i64::from(r.rating)).sum();
    Some(sum as f64 / reviews.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FeatureFlags, MenuItem, OperatingHours};

    fn region(dong: &str) -> RegionTriple {
        RegionTriple {
            sido: "서울특별시".to_string(),
            sigungu: "마포구".to_string(),
            dong: dong.to_string(),
        }
    }

    fn draft(kind: BusinessKind, category: &str, name: &str) -> BusinessDraft {
        BusinessDraft {
            kind,
            region: region("망원동"),
            category: category.to_string(),
            name: name.to_string(),
            description: "테스트 업체".to_string(),
            phone: None,
            homepage: None,
            blog: None,
            instagram: None,
            address_road: None,
            address_detail: None,
            lat: None,
            lng: None,
            hours: OperatingHours::default(),
            features: FeatureFlags::default(),
            menus: vec![],
            services: vec![],
            image_url: None,
        }
    }

    #[test]
    fn test_ids_are_monotonic_and_never_reused() {
        let store = ListingStore::new();
        let a = store.create_business("alice", false, draft(BusinessKind::Food, "한식", "a"));
        let b = store.create_business("alice", false, draft(BusinessKind::Food, "한식", "b"));
        assert_eq!((a.id, b.id), (1, 2));

        assert!(store.delete_business(b.id));
        let c = store.create_business("alice", false, draft(BusinessKind::Food, "한식", "c"));
        assert_eq!(c.id, 3);
    }

    #[test]
    fn test_filter_returns_only_approved_in_region() {
        let store = ListingStore::new();
        let pending =
            store.create_business("alice", false, draft(BusinessKind::Food, "한식", "대기"));
        let approved =
            store.create_business("admin", true, draft(BusinessKind::Food, "한식", "승인"));
        store.create_business("bob", true, draft(BusinessKind::Repair, "에어컨", "수리"));

        let found = store.filter_businesses(BusinessKind::Food, &region("망원동"), None);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, approved.id);

        store.approve_business(pending.id);
        let found = store.filter_businesses(BusinessKind::Food, &region("망원동"), None);
        assert_eq!(found.len(), 2);

        // Same kind, different dong
        assert!(store
            .filter_businesses(BusinessKind::Food, &region("합정동"), None)
            .is_empty());
    }

    #[test]
    fn test_filter_by_category() {
        let store = ListingStore::new();
        store.create_business("a", true, draft(BusinessKind::Food, "한식", "국밥"));
        store.create_business("a", true, draft(BusinessKind::Food, "중식", "짜장"));

        let korean =
            store.filter_businesses(BusinessKind::Food, &region("망원동"), Some("한식"));
        assert_eq!(korean.len(), 1);
        assert_eq!(korean[0].name, "국밥");
    }

    #[test]
    fn test_categories_sorted_and_distinct() {
        let store = ListingStore::new();
        store.create_business("a", false, draft(BusinessKind::Food, "중식", "x"));
        store.create_business("a", false, draft(BusinessKind::Food, "한식", "y"));
        store.create_business("a", false, draft(BusinessKind::Food, "한식", "z"));

        assert_eq!(store.categories(BusinessKind::Food), vec!["중식", "한식"]);
        assert!(store.categories(BusinessKind::Repair).is_empty());
    }

    #[test]
    fn test_delete_cascades_reviews() {
        let store = ListingStore::new();
        let b1 = store.create_business("a", true, draft(BusinessKind::Food, "한식", "x"));
        let b2 = store.create_business("a", true, draft(BusinessKind::Food, "한식", "y"));
        store.add_review(b1.id, "bob", 5, "좋아요");
        store.add_review(b1.id, "carol", 3, "보통");
        store.add_review(b2.id, "bob", 4, "괜찮아요");

        assert!(store.delete_business(b1.id));
        assert!(store.reviews_for(b1.id).is_empty());
        assert_eq!(store.reviews_for(b2.id).len(), 1);
    }

    #[test]
    fn test_update_preserves_id_approval_and_image() {
        let store = ListingStore::new();
        let mut d = draft(BusinessKind::Food, "한식", "원래이름");
        d.image_url = Some("/static/uploads/a.jpg".to_string());
        let created = store.create_business("alice", true, d);
        store.mark_paid(created.id);

        let mut edit = draft(BusinessKind::Food, "분식", "새이름");
        edit.menus = vec![MenuItem {
            name: "떡볶이".to_string(),
            price: "5000".to_string(),
        }];
        let updated = store.update_business(created.id, edit).unwrap();

        assert_eq!(updated.id, created.id);
        assert!(updated.approved);
        assert!(updated.paid);
        assert_eq!(updated.owner, "alice");
        assert_eq!(updated.name, "새이름");
        assert_eq!(updated.category, "분식");
        assert_eq!(updated.menus.len(), 1);
        // No replacement image supplied, the old one stays
        assert_eq!(updated.image_url.as_deref(), Some("/static/uploads/a.jpg"));
    }

    #[test]
    fn test_average_rating() {
        let store = ListingStore::new();
        let b = store.create_business("a", true, draft(BusinessKind::Food, "한식", "x"));
        assert_eq!(average_rating(&store.reviews_for(b.id)), None);

        store.add_review(b.id, "bob", 5, "");
        store.add_review(b.id, "carol", 2, "");
        assert_eq!(average_rating(&store.reviews_for(b.id)), Some(3.5));
    }

    #[test]
    fn test_posts_filtered_by_region() {
        let store = ListingStore::new();
        store.add_post("제목", "내용", "alice", region("망원동"), None);
        store.add_post("다른동", "내용", "bob", region("합정동"), None);

        let posts = store.posts_in(&region("망원동"));
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].user, "alice");
        assert_eq!(posts[0].id, 1);
    }
}
