use crate::model::{OwnerHolding, OwnerSummaries, OwnerSummary, Parcel};

/// Fold every claim of every khewat into per-owner summaries.
///
/// Owners are keyed by exact name and kept in first-seen order. A later
/// remark replaces an earlier one. Two claims by the same owner in the same
/// khewat collapse into one holding whose fraction and area are the sums.
pub fn aggregate_owners(parcels: &[Parcel]) -> OwnerSummaries {
    let mut summaries = OwnerSummaries::default();

    for parcel in parcels {
        for claim in &parcel.claims {
            let slot = match summaries.index.get(&claim.owner) {
                Some(&i) => i,
                None => {
                    summaries.owners.push(OwnerSummary {
                        name: claim.owner.clone(),
                        holdings: Vec::new(),
                        total: Default::default(),
                        remark: None,
                    });
                    let i = summaries.owners.len() - 1;
                    summaries.index.insert(claim.owner.clone(), i);
                    i
                }
            };
            let owner = &mut summaries.owners[slot];

            owner.total = &owner.total + &claim.allocated;
            if claim.remark.is_some() {
                owner.remark = claim.remark.clone();
            }

            match owner.holdings.iter_mut().find(|h| h.parcel_id == parcel.id) {
                Some(holding) => {
                    holding.fraction = &holding.fraction + &claim.fraction;
                    holding.allocated = &holding.allocated + &claim.allocated;
                    if claim.remark.is_some() {
                        holding.remark = claim.remark.clone();
                    }
                }
                None => owner.holdings.push(OwnerHolding {
                    parcel_id: parcel.id.clone(),
                    parcel_total: parcel.total.clone(),
                    fraction: claim.fraction.clone(),
                    allocated: claim.allocated.clone(),
                    remark: claim.remark.clone(),
                }),
            }
        }
    }

    summaries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocate::build_parcel;
    use crate::model::{AreaInput, RawClaim, RawParcel};
    use crate::quantity::Quantity;

    fn parcel(id: &str, marlas: &str, owners: &[(&str, &str, Option<&str>)]) -> Parcel {
        build_parcel(&RawParcel {
            id: id.into(),
            area: AreaInput {
                kanals: String::new(),
                marlas: marlas.into(),
            },
            owners: owners
                .iter()
                .map(|(name, share, remark)| RawClaim {
                    name: name.to_string(),
                    share: share.to_string(),
                    remarks: remark.map(str::to_string),
                })
                .collect(),
        })
        .unwrap()
    }

    #[test]
    fn folds_across_parcels() {
        let parcels = vec![
            parcel("1", "40", &[("Asha", "1/2", None), ("Bilal", "1/2", None)]),
            parcel("2", "20", &[("Bilal", "1", None)]),
        ];
        let owners = aggregate_owners(&parcels);
        assert_eq!(owners.len(), 2);

        let names: Vec<&str> = owners.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["Asha", "Bilal"]);

        let bilal = owners.get("Bilal").unwrap();
        assert_eq!(bilal.total, Quantity::from_marlas(40));
        assert_eq!(bilal.holdings.len(), 2);
        assert_eq!(bilal.holding("2").unwrap().allocated, Quantity::from_marlas(20));
        assert_eq!(owners.grand_total(), Quantity::from_marlas(60));
    }

    #[test]
    fn names_are_exact_keys() {
        let parcels = vec![parcel("1", "20", &[("Asha", "1/2", None), ("asha", "1/2", None)])];
        let owners = aggregate_owners(&parcels);
        assert_eq!(owners.len(), 2);
        assert!(owners.get("ASHA").is_none());
    }

    #[test]
    fn last_remark_wins() {
        let parcels = vec![
            parcel("1", "20", &[("Asha", "1", Some("first"))]),
            parcel("2", "20", &[("Asha", "1", None)]),
            parcel("3", "20", &[("Asha", "1", Some("third"))]),
        ];
        let owners = aggregate_owners(&parcels);
        let asha = owners.get("Asha").unwrap();
        assert_eq!(asha.remark.as_deref(), Some("third"));
        assert_eq!(asha.holding("1").unwrap().remark.as_deref(), Some("first"));
    }

    #[test]
    fn duplicate_claim_in_one_parcel_merges() {
        let parcels = vec![parcel("1", "36", &[("Asha", "1/3", None), ("Asha", "1/6", Some("gift"))])];
        let owners = aggregate_owners(&parcels);
        let asha = owners.get("Asha").unwrap();
        assert_eq!(asha.holdings.len(), 1);
        assert_eq!(asha.total, Quantity::from_marlas(18));
        assert_eq!(asha.holdings[0].allocated, asha.total);
        assert_eq!(asha.holdings[0].fraction.to_string(), "1/2");
        assert_eq!(asha.holdings[0].remark.as_deref(), Some("gift"));
    }
}
