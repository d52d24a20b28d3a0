//! Environmental protection flags of an area

use regions_core::indexed_enum;

indexed_enum! {
    /// Environmental effect an area can be protected from.
    ///
    /// Offsets are declaration order and keys are stored in area
    /// configuration, so neither may be reordered or renamed.
    pub enum Protection {
        /// Damage dealt to entities
        Damage => "damage",
        /// Potion effects applied by splash or lingering potions
        Potion => "potion",
        /// Fire ignition and burning
        Fire => "fire",
        /// Blocks fading (ice melting, coral dying)
        Fade => "fade",
        /// Crop and plant growth
        Growth => "growth",
        /// Blocks forming (snow layers, ice, concrete)
        Form => "form",
        /// Blocks spreading (grass, mycelium, vines)
        Spread => "blockSpread",
        /// Redstone activity
        Redstone => "redstone",
        /// Liquids flowing in from outside the area
        Overflow => "overflow",
        /// Liquids flowing inside the area
        Flood => "flood",
        /// Entities changing blocks (endermen, falling blocks)
        EntityChangeBlock => "entityChangeBlock",
        /// Explosions breaking blocks
        Explosion => "explosion",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regions_core::IndexedEnum;

    #[test]
    fn test_declaration_offsets() {
        assert_eq!(Protection::COUNT, 12);
        assert_eq!(Protection::Damage.offset(), 0);
        assert_eq!(Protection::Spread.offset(), 6);
        assert_eq!(Protection::Explosion.offset(), 11);
        assert_eq!(Protection::by_offset(12), None);
    }

    #[test]
    fn test_configuration_keys() {
        assert_eq!(Protection::Spread.key(), "blockSpread");
        assert_eq!(Protection::by_key("blockspread"), Some(Protection::Spread));
        assert_eq!(Protection::by_key("spread"), None);
        assert_eq!(
            Protection::by_key("ENTITYCHANGEBLOCK"),
            Some(Protection::EntityChangeBlock)
        );
        assert_eq!(Protection::Overflow.to_string(), "overflow");
    }
}
