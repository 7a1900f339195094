//! Name pools for generated entities.

pub const COMMODITY_NAMES: &[&str] = &[
    "Amethyst Shard",
    "Blaze Rod",
    "Coal",
    "Copper Ingot",
    "Diamond",
    "Echo Shard",
    "Emerald",
    "Glowstone Dust",
    "Gold Nugget",
    "Iron Ingot",
    "Lapis Lazuli",
    "Nether Quartz",
    "Netherite Ingot",
    "Obsidian",
    "Prismarine Crystals",
    "Redstone",
    "Slimeball",
    "String",
];

pub const RESOURCE_NAMES: &[&str] = &[
    "Ashfall's Tear",
    "Benkongerike",
    "Bleakcoast Cave",
    "Blind Cliff Cave",
    "Bloodchill Cavern",
    "Boulderfall Cave",
    "Brinewater Grotto",
    "Broken Fang Cave",
    "Bronze Water Cave",
    "Castle Karstaag Ruins",
    "Chillwind Depths",
    "Clearspring Cave",
    "Glacial Cave",
    "Orotheim",
    "Redoran's Retreat",
    "Sightless Pit",
];

pub const TRADER_NAMES: &[&str] = &[
    "Allie Graham",
    "Audrey Cobb",
    "Bernard Frost",
    "Bert Shepherd",
    "Buck Pierce",
    "Callie Barron",
    "Cora Kramer",
    "Dana Rowland",
    "Drew Flynn",
    "Effie Sheppard",
    "Janie Meyers",
    "Lea Carpenter",
    "Loren Calhoun",
    "Milo Chaney",
    "Pierce Hodge",
    "Rae Vincent",
];

pub const CONSUMER_NAMES: &[&str] = &[
    "Alex", "Allay", "Axolotl", "Cat", "Fox", "Frog", "Johnny", "Mooshroom", "Ocelot", "Papa",
    "Parrot", "Steve",
];

pub const BUDGET_NAMES: &[&str] = &[
    "Apple Pie",
    "Bacon Sandwich",
    "Baked Cod Stew",
    "Beef Stew",
    "Cabbage Rolls",
    "Chicken Soup",
    "Cooked Cod",
    "Golden Carrot",
    "Mushroom Stew",
    "Pumpkin Pie",
];
