use crate::models::ItineraryOffer;
use std::cmp::Ordering;

/// Best Deal and Best Seller picked from the same offer list. Both may point
/// at the same offer.
#[derive(Debug, Clone, Copy)]
pub struct Selection<'a> {
    pub best_deal: &'a ItineraryOffer,
    pub best_seller: &'a ItineraryOffer,
}

/// `None` only for an empty list.
pub fn select(offers: &[ItineraryOffer]) -> Option<Selection<'_>> {
    let best_deal = offers.iter().enumerate().min_by(|a, b| deal_order(a, b))?.1;
    let best_seller = offers.iter().enumerate().min_by(|a, b| seller_order(a, b))?.1;
    Some(Selection {
        best_deal,
        best_seller,
    })
}

/// Lower price first, unpriced last; then fewer legs, higher sales score,
/// earlier position.
fn deal_order(a: &(usize, &ItineraryOffer), b: &(usize, &ItineraryOffer)) -> Ordering {
    ascending_known(a.1.total_price, b.1.total_price)
        .then_with(|| a.1.legs.len().cmp(&b.1.legs.len()))
        .then_with(|| descending_known(a.1.sales_score, b.1.sales_score))
        .then_with(|| a.0.cmp(&b.0))
}

/// Higher sales score first, unscored last; then lower price, fewer legs,
/// earlier position.
fn seller_order(a: &(usize, &ItineraryOffer), b: &(usize, &ItineraryOffer)) -> Ordering {
    descending_known(a.1.sales_score, b.1.sales_score)
        .then_with(|| ascending_known(a.1.total_price, b.1.total_price))
        .then_with(|| a.1.legs.len().cmp(&b.1.legs.len()))
        .then_with(|| a.0.cmp(&b.0))
}

fn ascending_known(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn descending_known(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Leg;

    fn offer(price: Option<f64>, legs: usize, sales: Option<f64>) -> ItineraryOffer {
        ItineraryOffer {
            legs: vec![Leg::default(); legs],
            total_price: price,
            cabin_class: "Economy".to_string(),
            sales_score: sales,
        }
    }

    #[test]
    fn empty_list_has_no_selection() {
        assert!(select(&[]).is_none());
    }

    #[test]
    fn cheapest_and_most_popular_are_chosen() {
        let offers = vec![
            offer(Some(738.0), 2, Some(40.0)),
            offer(Some(856.0), 2, Some(95.0)),
            offer(None, 1, Some(10.0)),
        ];
        let selection = select(&offers).unwrap();

        assert_eq!(selection.best_deal.total_price, Some(738.0));
        assert_eq!(selection.best_seller.sales_score, Some(95.0));
        for other in &offers {
            if let Some(price) = other.total_price {
                assert!(selection.best_deal.total_price.unwrap() <= price);
            }
            if let Some(score) = other.sales_score {
                assert!(selection.best_seller.sales_score.unwrap() >= score);
            }
        }
    }

    #[test]
    fn dominant_offer_fills_both_slots() {
        let offers = vec![offer(Some(500.0), 1, Some(99.0)), offer(Some(700.0), 2, Some(10.0))];
        let selection = select(&offers).unwrap();

        assert!(std::ptr::eq(selection.best_deal, selection.best_seller));
    }

    #[test]
    fn price_ties_prefer_fewer_legs_then_sales() {
        let offers = vec![
            offer(Some(500.0), 3, Some(90.0)),
            offer(Some(500.0), 2, Some(10.0)),
            offer(Some(500.0), 2, Some(50.0)),
        ];
        let selection = select(&offers).unwrap();

        assert!(std::ptr::eq(selection.best_deal, &offers[2]));
    }

    #[test]
    fn score_ties_prefer_lower_price_and_unscored_rank_last() {
        let offers = vec![
            offer(Some(100.0), 1, None),
            offer(Some(900.0), 1, Some(60.0)),
            offer(Some(800.0), 1, Some(60.0)),
        ];
        let selection = select(&offers).unwrap();

        assert!(std::ptr::eq(selection.best_seller, &offers[2]));
        assert!(std::ptr::eq(selection.best_deal, &offers[0]));
    }
}
